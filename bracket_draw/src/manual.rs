/*!

This is the long-form manual for `bracket_draw` and `tkdbracket`.

## Input formats

The following formats are supported:
* `xlsx` Excel workbooks (`.xlsx`, `.xlsm`). Every worksheet is one category.
* `csv` Comma Separated Values. The whole file is one category, named after
  the file.

The first row with any content is the header. Only a name column is
required. The other columns are optional:

| field         | recognized headers                                         |
|---------------|------------------------------------------------------------|
| name          | `name`, `competitor`, `competitor name`, `athlete`, `full name`, `player` |
| club          | `club`, `team`, `club/team`, `team/club`, `dojang`, `school` |
| gender        | `gender`, `sex`                                            |
| weight        | `weight`, `weight class`, `weight category`, `division`    |
| class         | `class`, `belt`, `grade`, `level`, `skill`                 |
| draw position | `draw position`, `draw`, `position`, `draw no`, `seed`     |

Headers are compared after trimming, lowercasing and collapsing spaces,
underscores, hyphens and dots, so `Draw_Position` and `draw-position` both
match. The lists can be replaced in the configuration file.

When a draw position column is present, competitors are placed in the
bracket in that order. Otherwise the row order of the sheet is used.
Competitors without a draw position come after the numbered ones, in row
order. A draw position used twice in the same sheet is an error for that
sheet.

## Seeding

The roster is padded with byes up to the next power of two. Byes are always
appended after the last competitor: with 5 competitors, slots 6, 7 and 8 are
byes, the competitor in slot 5 meets a bye and slots 7 and 8 pair two byes.
This puts all the byes at the bottom of the draw, which is not the usual
convention of spreading them out. Use draw positions to choose who gets them.

## Output

One SVG file per page, sized as an A4 portrait sheet (210mm x 297mm):
* `<sheet>_bracket.svg` the bracket, with `Winner` boxes for the intermediate
  rounds and a `Champion` box for the final.
* `<sheet>_listing.svg` or `<sheet>_listing_<n>.svg` the list of competitors.

A category that cannot be drawn (fewer than two competitors, a missing name
column, a bracket too large for the page) is reported and skipped; the other
categories are still produced.

## Configuration file

All the keys are optional.

```json
{
  "inputFile": "open_2024.xlsx",
  "outputDirectory": "out",
  "mode": "both",
  "columns": {
    "name": ["name", "competitor"],
    "firstColumnAsName": false
  },
  "layout": {
    "boxWidthRatio": 0.85,
    "minBoxHeight": 8,
    "maxBoxHeight": 12,
    "palette": ["#a0c4ff", "#ffc6ff", "#beffbe", "#ffecb3"],
    "championFill": "#dcdcdc"
  },
  "listing": { "rowHeight": 7 },
  "titles": { "footer": "Generated by TKD Bracket Generator" }
}
```

*/
